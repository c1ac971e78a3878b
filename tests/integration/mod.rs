mod persistence;
mod server;
