use std::{
    error::Error,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use bnb_tsp::{CostModel, Tour};

/// Reads a tour written by [`export_tour`] and evaluates it on `model`.
pub fn import_tour<P, C>(filename: P, model: &C) -> Result<Tour, Box<dyn Error>>
where
    P: AsRef<Path>,
    C: CostModel,
{
    let file = File::open(filename)?;
    let reader = BufReader::new(file);

    let mut points = vec![];
    let mut seen = vec![false; model.n()];
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let point = line.trim().parse::<usize>()?;
        if point >= model.n() {
            return Err(format!("point {} is out of range for {} points", point, model.n()).into());
        }
        if seen[point] {
            return Err(format!("point {} appears twice in the tour", point).into());
        }
        seen[point] = true;
        points.push(point);
    }
    let tour = Tour::with_cost_from(points, model);
    if !tour.is_feasible(model.n()) {
        return Err(format!("imported tour of cost {} is not a feasible tour", tour.cost()).into());
    }
    Ok(tour)
}

/// Writes one point index per line, starting with the first point of the tour.
pub fn export_tour<P: AsRef<Path>>(filename: P, tour: &Tour) -> Result<(), Box<dyn Error>> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    for point in tour {
        writeln!(writer, "{}", point)?;
    }
    writer.flush()?;

    Ok(())
}
