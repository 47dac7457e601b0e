#![no_main]

use libfuzzer_sys::fuzz_target;
use p16_core::memory::sp_in_window;
use p16_core::{
    run, CoreConfig, CoreState, DecodedInstruction, Decoder, RunState, StepOutcome,
};

const MAX_STEPS: u64 = 4096;

fuzz_target!(|data: &[u8]| {
    let words: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    for word in &words {
        let decoded = Decoder::decode(*word);
        if !matches!(decoded, DecodedInstruction::Unrecognized { .. }) {
            assert_eq!(Decoder::decode(decoded.encode()), decoded);
        }
    }

    let mut state = CoreState::default();
    state.load_program((0_u16..).step_by(2).zip(words));
    let outcome = run(&mut state, &CoreConfig::with_max_steps(MAX_STEPS));

    assert!(sp_in_window(state.arch.sp()));
    match outcome.final_step {
        StepOutcome::Fault { cause, pc } => {
            assert_eq!(state.run_state, RunState::Faulted(cause));
            assert_eq!(state.arch.pc(), pc);
        }
        StepOutcome::Halted { reason } => assert_eq!(state.run_state, RunState::Halted(reason)),
        StepOutcome::Retired => assert_eq!(outcome.steps, MAX_STEPS),
    }
});
