use std::str::FromStr;

use plotters::prelude::*;
use thermo::{compute_statistics, Log};

fn hours(time: time::Time) -> f32 {
    time.hour() as f32 + time.minute() as f32 / 60.0
}

fn main() {
    let input = std::env::args().nth(1).expect("Missing filename");
    println!("opening {input}");
    let output = format!("{input}.png");
    let input = std::fs::read_to_string(input).unwrap();

    let log = Log::from_str(&input).unwrap();

    let root = BitMapBackend::new(&output, (1920, 1080)).into_drawing_area();
    root.fill(&WHITE).unwrap();
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Relevé de température pour {}", log.header.name),
            ("sans-serif", 100).into_font(),
        )
        .margin(5)
        .x_label_area_size(80)
        .y_label_area_size(80)
        .build_cartesian_2d(
            hours(log.first_time())..hours(log.last_time()),
            log.temperature_range(),
        )
        .unwrap();

    chart.configure_mesh().draw().unwrap();

    chart
        .draw_series(LineSeries::new(
            log.observations
                .iter()
                .map(|obs| (hours(obs.time), obs.value)),
            GREEN,
        ))
        .unwrap()
        .label("Température")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    // The summary of the raw values stays in the unit of the log, so it can
    // be drawn on the same axis as the observations
    let values: Vec<f32> = log.observations.iter().map(|obs| obs.value).collect();
    let stats = compute_statistics(&values);

    chart
        .draw_series(LineSeries::new(
            [
                (hours(log.first_time()), stats.average),
                (hours(log.last_time()), stats.average),
            ],
            RED,
        ))
        .unwrap()
        .label("Température moyenne")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .unwrap();

    root.present().unwrap();
}
