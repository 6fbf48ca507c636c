//! `fsinspect` — a read-only inspector for EXT2 and FAT16 filesystem images.

use fsinspect::Image;
use fsinspect::error::Error;
use std::env;
use std::io;
use std::path::PathBuf;
use std::process::exit;

/// The operation requested on the command line.
enum Op {
    Info,
    Tree,
    Cat(String),
}

/// Structure storing command line arguments.
struct Args {
    /// The name of the current program used in command line.
    prog: String,

    /// The requested operation, if any was recognized.
    op: Option<Op>,

    /// Path to the image file, resolved relative to the `res/` prefix.
    image: Option<PathBuf>,
}

impl Args {
    fn validate(&self) -> Result<(), Error> {
        if self.op.is_some() && self.image.is_some() {
            Ok(())
        } else {
            Err(Error::Arg("Error arguments".to_owned()))
        }
    }
}

/// Images are looked up under this fixed prefix, matching the original tool's behavior.
const RES_PREFIX: &str = "res/";

fn resolve_image(name: &str) -> PathBuf {
    PathBuf::from(RES_PREFIX).join(name)
}

fn parse_args() -> Args {
    let mut iter = env::args();
    let prog = iter.next().unwrap_or_else(|| "fsinspect".to_owned());

    let mut op = None;
    let mut image = None;

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--info" => {
                image = iter.next().map(|s| resolve_image(&s));
                op = Some(Op::Info);
            }
            "--tree" => {
                image = iter.next().map(|s| resolve_image(&s));
                op = Some(Op::Tree);
            }
            "--cat" => {
                image = iter.next().map(|s| resolve_image(&s));
                let target = iter.next();
                op = target.map(Op::Cat);
                if op.is_none() {
                    image = None;
                }
            }
            _ => {}
        }
    }

    Args { prog, op, image }
}

fn print_usage(prog: &str) {
    eprintln!("Usage: {prog} --info|--tree <image>");
    eprintln!("       {prog} --cat <image> <filename-or-path>");
}

fn not_found_message(is_ext2: bool, name: &str) -> String {
    if is_ext2 {
        format!("EXT2: file '{name}' not found")
    } else {
        format!("Fitxer '{name}' no trobat.")
    }
}

fn run(args: Args) -> Result<(), Error> {
    let image_path = args.image.as_ref().expect("validated by Args::validate");
    let mut image = Image::open(image_path).map_err(|_| Error::Format("Error opening the file".to_owned()))?;

    match args.op.expect("validated by Args::validate") {
        Op::Info => {
            print!("{}", image.info());
            Ok(())
        }
        Op::Tree => {
            print!("{}", image.tree()?);
            Ok(())
        }
        Op::Cat(target) => {
            let is_ext2 = image.is_ext2();
            let mut stdout = io::stdout();
            image.cat(&target, &mut stdout).map_err(|e| match e {
                Error::NotFound(name) => Error::NotFound(not_found_message(is_ext2, &name)),
                other => other,
            })
        }
    }
}

fn main() {
    let args = parse_args();
    let prog = args.prog.clone();

    let result = args.validate().and_then(|()| run(args));

    match result {
        Ok(()) => {}
        Err(Error::Arg(msg)) => {
            eprintln!("{msg}");
            print_usage(&prog);
            exit(1);
        }
        Err(Error::NotFound(msg)) => {
            eprintln!("{msg}");
            exit(1);
        }
        Err(Error::Format(_)) => {
            eprintln!("Error opening the file");
            exit(1);
        }
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    }
}
