// Market data module entrypoint
pub mod sources;       // snapshot providers (fixture, simulated, file)
