#![no_std]

mod contract;
mod events;
mod invariant;
mod liquidation;
mod masset;
mod msg;
mod peg;
mod storage;
mod validator;
