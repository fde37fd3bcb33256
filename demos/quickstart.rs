use solar_terms::{MeeusSun, SolarTermError, SolarTermRecord, TermScanner};

fn main() -> Result<(), SolarTermError> {
    let year = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(2025);

    let scanner = TermScanner::with_defaults(MeeusSun);
    println!("{}", SolarTermRecord::COLUMNS.join(","));
    for event in scanner.scan_year(year)? {
        let record = event.to_record();
        println!(
            "{},{},{},{}",
            record.year, record.term_index, record.ecliptic_longitude_deg, record.utc_time
        );
    }
    Ok(())
}
