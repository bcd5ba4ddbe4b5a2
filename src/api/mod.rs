pub mod frank;
pub mod frank_dto;
pub mod utils;
