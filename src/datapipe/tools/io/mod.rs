pub mod cwl_read;
pub mod cwl_write;
pub mod manifest;
