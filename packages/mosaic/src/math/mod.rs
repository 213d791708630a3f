pub mod bn;
pub mod casting;
pub mod ceil_div;
pub mod ratio;
pub mod safe_math;
