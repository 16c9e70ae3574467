//! different utility modules used throughout the project
/// logger initialisation and csv export of sampled values
pub mod logger;
/// charts of sampled functions (plotters) and value tables (tabled)
pub mod plots;
/// typed settings built on top of the task_parser document format
pub mod settings;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into HashMap
pub mod task_parser;
