//! Borrow form lifecycle
//!
//! A form is stored as a tri-state approval flag plus two booleans. The
//! status enum below is derived from them and is the only thing the
//! transition checks look at.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Pending,
    Approved,
    Rejected,
    Issued,
    Returned,
}

impl BorrowStatus {
    /// Derive the status from the stored flags.
    ///
    /// `is_returned` wins over `is_issued`, which wins over the approval flag.
    pub fn from_flags(is_approved: Option<bool>, is_issued: bool, is_returned: bool) -> Self {
        match (is_approved, is_issued, is_returned) {
            (_, _, true) => BorrowStatus::Returned,
            (_, true, false) => BorrowStatus::Issued,
            (Some(true), false, false) => BorrowStatus::Approved,
            (Some(false), false, false) => BorrowStatus::Rejected,
            (None, false, false) => BorrowStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Pending => "pending",
            BorrowStatus::Approved => "approved",
            BorrowStatus::Rejected => "rejected",
            BorrowStatus::Issued => "issued",
            BorrowStatus::Returned => "returned",
        }
    }

    /// Approve/reject is only possible while nobody has decided yet
    pub fn ensure_can_decide(self) -> Result<(), DomainError> {
        match self {
            BorrowStatus::Pending => Ok(()),
            _ => Err(DomainError::InvalidState(
                "Form already processed".to_string(),
            )),
        }
    }

    pub fn ensure_can_issue(self) -> Result<(), DomainError> {
        match self {
            BorrowStatus::Approved => Ok(()),
            BorrowStatus::Pending => Err(DomainError::InvalidState(
                "Form has not been approved yet".to_string(),
            )),
            BorrowStatus::Rejected => Err(DomainError::InvalidState(
                "Form was rejected".to_string(),
            )),
            BorrowStatus::Issued | BorrowStatus::Returned => Err(DomainError::InvalidState(
                "Items for this form were already issued".to_string(),
            )),
        }
    }

    pub fn ensure_can_return(self) -> Result<(), DomainError> {
        match self {
            BorrowStatus::Issued => Ok(()),
            BorrowStatus::Returned => Err(DomainError::InvalidState(
                "Items for this form were already returned".to_string(),
            )),
            _ => Err(DomainError::InvalidState(
                "Items for this form have not been issued".to_string(),
            )),
        }
    }
}

impl fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BorrowStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(BorrowStatus::Pending),
            "approved" => Ok(BorrowStatus::Approved),
            "rejected" => Ok(BorrowStatus::Rejected),
            "issued" => Ok(BorrowStatus::Issued),
            "returned" => Ok(BorrowStatus::Returned),
            other => Err(DomainError::Validation(format!(
                "Unknown borrow status '{}'",
                other
            ))),
        }
    }
}

/// Account roles. Stored as their display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Student,
    Professor,
    Administrator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Professor => "Professor",
            Role::Administrator => "Administrator",
        }
    }

    /// Professors sign off on forms for their subjects; administrators run the toolroom
    pub fn can_decide_forms(&self) -> bool {
        matches!(self, Role::Professor | Role::Administrator)
    }

    pub fn can_manage_stock(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Student" => Ok(Role::Student),
            "Professor" => Ok(Role::Professor),
            "Administrator" => Ok(Role::Administrator),
            other => Err(DomainError::Validation(format!("Unknown role '{}'", other))),
        }
    }
}

/// `BRW-<yyyyMMddHHmmss>-<4 hex chars>`
pub fn reference_code<Tz: TimeZone>(submitted_at: &DateTime<Tz>, nonce: uuid::Uuid) -> String
where
    Tz::Offset: fmt::Display,
{
    let suffix: String = nonce
        .simple()
        .to_string()
        .chars()
        .take(4)
        .collect::<String>()
        .to_uppercase();
    format!("BRW-{}-{}", submitted_at.format("%Y%m%d%H%M%S"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_status_from_flags() {
        assert_eq!(
            BorrowStatus::from_flags(None, false, false),
            BorrowStatus::Pending
        );
        assert_eq!(
            BorrowStatus::from_flags(Some(true), false, false),
            BorrowStatus::Approved
        );
        assert_eq!(
            BorrowStatus::from_flags(Some(false), false, false),
            BorrowStatus::Rejected
        );
        assert_eq!(
            BorrowStatus::from_flags(Some(true), true, false),
            BorrowStatus::Issued
        );
        assert_eq!(
            BorrowStatus::from_flags(Some(true), true, true),
            BorrowStatus::Returned
        );
    }

    #[test]
    fn test_rejection_is_terminal() {
        let rejected = BorrowStatus::Rejected;
        assert!(rejected.ensure_can_decide().is_err());
        assert!(rejected.ensure_can_issue().is_err());
        assert!(rejected.ensure_can_return().is_err());
    }

    #[test]
    fn test_happy_path_transitions() {
        assert!(BorrowStatus::Pending.ensure_can_decide().is_ok());
        assert!(BorrowStatus::Pending.ensure_can_issue().is_err());
        assert!(BorrowStatus::Approved.ensure_can_issue().is_ok());
        assert!(BorrowStatus::Approved.ensure_can_return().is_err());
        assert!(BorrowStatus::Issued.ensure_can_return().is_ok());
        assert!(BorrowStatus::Returned.ensure_can_return().is_err());
    }

    #[test]
    fn test_status_parse_round_trip() {
        assert_eq!("Issued".parse::<BorrowStatus>().unwrap(), BorrowStatus::Issued);
        assert!("lost".parse::<BorrowStatus>().is_err());
    }

    #[test]
    fn test_reference_code_shape() {
        let at = Utc.with_ymd_and_hms(2025, 11, 3, 14, 5, 9).unwrap();
        let code = reference_code(&at, uuid::Uuid::nil());
        assert_eq!(code, "BRW-20251103140509-0000");

        let code = reference_code(&at, uuid::Uuid::new_v4());
        assert_eq!(code.len(), "BRW-20251103140509-ABCD".len());
        assert!(code[19..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_role_permissions() {
        assert!(!Role::Student.can_decide_forms());
        assert!(Role::Professor.can_decide_forms());
        assert!(!Role::Professor.can_manage_stock());
        assert!(Role::Administrator.can_manage_stock());
    }
}
