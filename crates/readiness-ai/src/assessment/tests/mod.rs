mod analytics;
mod common;
mod routing;
