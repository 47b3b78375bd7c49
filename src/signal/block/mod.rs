pub mod affine;
pub mod band_pass;
pub mod envelope;
