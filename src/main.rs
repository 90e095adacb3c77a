use std::{env::args, error::Error, fs, process::ExitCode};
use course_format::{checksum, terrain::{self, LevelBounds, GROUND_KIND}, Course};
use itertools::Itertools;
use log::{error, info};

const USAGE: &str = "usage: course_tool info <course>\n       course_tool resave <course> <out>\n       course_tool ground <course> <out>";

fn print_info(course: &Course, data: &[u8]) {
	let header = &course.header;
	println!("name:      {}", header.name);
	println!(
		"created:   {:04}-{:02}-{:02} {:02}:{:02}",
		header.creation_year, header.creation_month, header.creation_day, header.creation_hour, header.creation_minute,
	);
	println!("style:     {:?} ({})", header.style, header.style.index());
	println!("theme:     {}", header.theme);
	println!("time:      {}", header.time_limit);
	println!("checksum:  {}", if checksum::verify(data) { "ok" } else { "mismatch" });
	println!("objects:   {}", course.objects.len());
	for (kind, count) in course.objects.iter().map(|object| object.kind).counts().into_iter().sorted() {
		let label = if kind == GROUND_KIND { " (ground)" } else { "" };
		println!("  type {:3}{}: {}", kind, label, count);
	}
	if let Some(extent) = course.extent() {
		println!("extent:    {} .. {}", extent.min, extent.max);
	}
	let bounds = LevelBounds::default();
	let outside = course.objects.iter().filter(|object| !bounds.contains(object.pos.truncate())).count();
	if outside > 0 {
		println!("outside:   {}", outside);
	}
}

fn run(command: &str, input: &str, output: Option<&str>) -> Result<(), Box<dyn Error>> {
	let data = fs::read(input)?;
	let mut course = Course::load(&data, &mut ())?;
	match command {
		"info" => print_info(&course, &data),
		"resave" | "ground" => {
			let output = output.ok_or(USAGE)?;
			if command == "ground" {
				let updated = terrain::regenerate_all_ground(&mut course.objects, &LevelBounds::default(), &mut ());
				info!("regenerated {} ground tiles", updated);
			}
			fs::write(output, course.save()?)?;
			info!("wrote {}", output);
		},
		_ => return Err(USAGE.into()),
	}
	Ok(())
}

fn main() -> ExitCode {
	env_logger::init();
	let args = args().skip(1).collect::<Vec<_>>();
	let (Some(command), Some(input)) = (args.first(), args.get(1)) else {
		eprintln!("{}", USAGE);
		return ExitCode::FAILURE;
	};
	match run(command, input, args.get(2).map(String::as_str)) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("{}: {}", input, e);
			ExitCode::FAILURE
		},
	}
}
