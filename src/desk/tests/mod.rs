mod common;
mod qualification;
mod routing;
