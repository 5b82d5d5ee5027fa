pub mod admin;
pub mod availability;
pub mod bookings;
pub mod events;
pub mod health;
pub mod session;
