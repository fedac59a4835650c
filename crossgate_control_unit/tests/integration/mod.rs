mod harness;

mod boot;
mod boundaries;
mod duty_abort;
mod extended_hold;
mod single_train;
