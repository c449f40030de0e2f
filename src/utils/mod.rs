pub mod header_utils;
