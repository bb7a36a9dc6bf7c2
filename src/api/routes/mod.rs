pub mod health;
pub mod rankings;
pub mod refresh;
pub mod tournaments;
