pub mod file_image_source;
pub mod http_image_source;
pub mod image_decoder;
pub mod jpeg_file_writer;
pub mod location_image_source;
