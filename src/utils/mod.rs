pub mod crc;
pub mod io;
