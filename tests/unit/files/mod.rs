mod decode_tests;
mod query_tests;
mod request_tests;
mod trash_tests;
