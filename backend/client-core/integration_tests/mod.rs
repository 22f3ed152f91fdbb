mod container;
mod helpers;
mod transport;
