#![allow(dead_code)]

pub mod dbf_fixture;
