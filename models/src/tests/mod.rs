mod relay_list;
mod relay_location;
mod tunnel;
