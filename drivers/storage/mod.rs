pub mod medium;
pub mod ram;
pub mod sector;
