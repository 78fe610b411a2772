use tally_core::{TotalAccumulator, TotalDisplay};

pub fn handle_reset<D: TotalDisplay + ?Sized>(accumulator: &mut TotalAccumulator, display: &mut D) {
    tracing::info!("resetting total (was {})", accumulator.value());
    accumulator.reset();
    display.show(accumulator.value());
}
