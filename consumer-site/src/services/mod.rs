pub mod listing_client;
