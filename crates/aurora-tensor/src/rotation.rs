// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Fibonacci Rotation
// Mirrors: the shared fibonacci tables of Infrastructure/IE/evolver.py,
// armonizador.py, extender.py
// ─────────────────────────────────────────────────────────────────────

/// Fibonacci sequence driving all rotation exploration.
///
/// Every engine walks this table with its own step counter; the step of
/// one engine never advances another's.
pub const FIBONACCI: [u32; 12] = [1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144];

/// Octal rotation amount for a given engine step and probe offset.
#[inline]
pub fn rotation_step(engine_step: usize, offset: usize) -> u8 {
    (FIBONACCI[(engine_step + offset) % FIBONACCI.len()] % 8) as u8
}
