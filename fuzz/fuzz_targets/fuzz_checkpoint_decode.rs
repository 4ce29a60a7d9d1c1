#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding and restoring must reject malformed checkpoints without panicking.
    if let Ok(checkpoint) = flow_ledger::LedgerCheckpoint::from_bytes(data) {
        let _ = checkpoint.verify();
        let _ = flow_ledger::SnapshotLedger::restore(&checkpoint);
    }
});
