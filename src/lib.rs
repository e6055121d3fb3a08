pub mod errors;
pub mod keygen;
pub mod primality;
pub mod prng;
pub mod seed;
pub mod serial;
pub mod util;
