pub mod fileio;
