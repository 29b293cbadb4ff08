#![cfg(test)]

mod connect;
mod hosts;
mod sources;
mod util;
