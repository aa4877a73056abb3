mod api_tests;
mod chat_tests;
