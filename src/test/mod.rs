mod fixtures;
mod forex;
mod import;
mod planner;
