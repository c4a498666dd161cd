//! Repository implementations using SeaORM

pub mod borrow_form_repository;
pub mod cart_repository;
pub mod inventory_repository;

pub use borrow_form_repository::SeaOrmBorrowFormRepository;
pub use cart_repository::SeaOrmCartRepository;
pub use inventory_repository::SeaOrmInventoryRepository;
