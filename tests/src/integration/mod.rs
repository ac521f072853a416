pub mod allocation_faults;
pub mod end_to_end;
pub mod permissions;
