#[path = "../../drivers/storage/mod.rs"]
pub mod storage;

#[path = "../../drivers/usb/mod.rs"]
pub mod usb;
