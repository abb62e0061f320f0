pub mod serial_generator;
