pub mod api_request_extractor;
