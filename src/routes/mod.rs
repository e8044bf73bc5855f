pub mod health;
pub mod rides;
pub mod upload;
