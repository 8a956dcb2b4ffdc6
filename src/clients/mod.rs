pub mod observation_client;
