mod retry_tests;
mod support;
mod worker_tests;
