pub mod config;
pub mod doctor;
pub mod init;
pub mod invoke;
pub mod roles;
pub mod skills;
