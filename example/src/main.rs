use log::info;
use unitmatrix::quantity::{Duration, Length, Position};
use unitmatrix::{AbsMatrix, MResult, MatrixValue, RelMatrix, RelScalar, StorageType};

fn main() -> MResult<()> {
    env_logger::init();

    let start: AbsMatrix<Position> = AbsMatrix::new(
        &[[0.0, 10.0], [20.0, 30.0]],
        Position::METER,
        StorageType::Dense,
    )?;
    let step: RelMatrix<Length> = RelMatrix::new(
        &[[1.5, 0.0], [0.0, 0.25]],
        Length::KILOMETER,
        StorageType::Sparse,
    )?;

    let end = start.plus(&step)?;
    let travelled: RelMatrix<Length> = end.minus(&start)?;
    info!("end positions (m): {:?}", end.values_si());
    info!("travelled (km): {:?}", travelled.values_in_unit(Length::KILOMETER));

    let time: RelMatrix<Duration> = RelMatrix::new(
        &[[60.0, 1.0], [1.0, 30.0]],
        Duration::SECOND,
        StorageType::Dense,
    )?;
    let speed = travelled.divide(&time)?;
    info!(
        "speed [{}] as {}: {:?} (layout {:?})",
        speed.dimensions(),
        speed.quantity_name(),
        speed.data().to_rows(),
        speed.data().storage_type()
    );

    let mut log_book = travelled.mutable();
    info!("copy-on-write before write: {:?}", log_book.copy_on_write_state());
    log_book.increment_by_scalar(RelScalar::new(100.0, Length::METER));
    log_book.set_in_unit(0, 1, 2.0, Length::KILOMETER)?;
    info!("copy-on-write after write: {:?}", log_book.copy_on_write_state());
    info!("log book (m): {:?}", log_book.values_si());
    info!("travelled is unchanged (m): {:?}", travelled.values_si());
    Ok(())
}
