pub mod borrow_form;
pub mod borrow_form_item;
pub mod cart_item;
pub mod inventory_item;
pub mod user;
