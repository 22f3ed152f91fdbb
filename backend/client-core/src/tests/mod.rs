mod cache;
mod dispatcher;
mod helpers;
mod teardown;
