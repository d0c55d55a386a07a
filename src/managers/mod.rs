pub mod code_defender;
pub mod cyberfraud;
