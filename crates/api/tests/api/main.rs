mod demo;
mod export;
mod helpers;
mod weather;
