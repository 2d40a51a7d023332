mod common;
mod fraud;
mod qualitative;
