use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use zeex_codec::LzmaCodec;
use zeex_core::format::{Header, DEFAULT_BLOCK_SIZE, HEADER_SIZE};
use zeex_core::{Reader, Writer};

#[derive(Parser)]
#[command(
    name = "zeex",
    about = "ZEEX — write-once chunked LZMA container with random-access reads",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file (or stdin, with `-`) into a ZEEX container.
    #[command(name = "c")]
    Compress {
        /// Source file, or "-" for stdin
        infile: PathBuf,
        /// Destination ZEEX file
        outfile: PathBuf,
        /// Uncompressed bytes per block
        #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
        block_size: u64,
    },
    /// Decompress a whole ZEEX file to outfile or stdout.
    #[command(name = "d")]
    Decompress {
        infile: PathBuf,
        /// Destination file, or "-"/omitted for stdout
        outfile: Option<PathBuf>,
    },
    /// Decompress the byte range `[start, end)` of a ZEEX file.
    #[command(name = "x")]
    Extract {
        infile: PathBuf,
        start: u64,
        end: u64,
        /// Destination file, or "-"/omitted for stdout
        #[arg(long)]
        outfile: Option<PathBuf>,
    },
    /// Print header and index metadata without decompressing payload.
    Inspect {
        infile: PathBuf,
        /// Print every index entry
        #[arg(long)]
        blocks: bool,
    },
}

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn open_output(outfile: &Option<PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    match outfile {
        None => Ok(Box::new(io::stdout())),
        Some(p) if p.to_str() == Some("-") => Ok(Box::new(io::stdout())),
        Some(p) => {
            Ok(Box::new(File::create(p).with_context(|| format!("creating output file {:?}", p))?))
        }
    }
}

fn run_compress(infile: PathBuf, outfile: PathBuf, block_size: u64) -> anyhow::Result<()> {
    let sink = File::create(&outfile).with_context(|| format!("creating output file {:?}", outfile))?;
    let mut writer = Writer::create(sink, Box::new(LzmaCodec::new()), Some(block_size))
        .context("initializing writer")?;

    let mut total = 0u64;
    let mut buf = vec![0u8; block_size as usize];

    if infile.to_str() == Some("-") {
        let stdin = io::stdin();
        let mut src = stdin.lock();
        loop {
            let n = src.read(&mut buf)?;
            if n == 0 {
                break;
            }
            writer.write(&buf[..n])?;
            total += n as u64;
        }
    } else {
        let file = File::open(&infile).with_context(|| format!("opening input file {:?}", infile))?;
        let mut src = BufReader::new(file);
        loop {
            let n = src.read(&mut buf)?;
            if n == 0 {
                break;
            }
            writer.write(&buf[..n])?;
            total += n as u64;
        }
    }

    let block_count = writer.finish().context("finalizing container")?;
    let compressed_size = std::fs::metadata(&outfile)?.len();

    eprintln!("  blocks      : {}", block_count);
    eprintln!("  raw size    : {}", human_bytes(total));
    eprintln!("  compressed  : {}", human_bytes(compressed_size));
    if total > 0 {
        eprintln!("  ratio       : {:.2}x", total as f64 / compressed_size as f64);
    }
    Ok(())
}

fn open_reader(infile: &PathBuf) -> anyhow::Result<Reader<File>> {
    let source = File::open(infile).with_context(|| format!("opening input file {:?}", infile))?;
    Reader::open(source, Box::new(LzmaCodec::new())).context("reading container header/index")
}

fn run_decompress(infile: PathBuf, outfile: Option<PathBuf>) -> anyhow::Result<()> {
    let mut reader = open_reader(&infile)?;
    let mut dst = open_output(&outfile)?;
    let len = reader.data_length();
    if len > 0 {
        reader.seek(0)?;
    }

    let mut remaining = len;
    const CHUNK: u64 = 1 << 20;
    while remaining > 0 {
        let want = remaining.min(CHUNK);
        let data = reader.read(want)?;
        dst.write_all(&data)?;
        remaining -= want;
    }
    Ok(())
}

fn run_extract(infile: PathBuf, start: u64, end: u64, outfile: Option<PathBuf>) -> anyhow::Result<()> {
    if end < start {
        anyhow::bail!("end ({}) must be >= start ({})", end, start);
    }
    let mut reader = open_reader(&infile)?;
    let mut dst = open_output(&outfile)?;
    reader.seek(start)?;

    let mut remaining = end - start;
    const CHUNK: u64 = 1 << 20;
    while remaining > 0 {
        let want = remaining.min(CHUNK);
        let data = reader.read(want)?;
        dst.write_all(&data)?;
        remaining -= want;
    }
    Ok(())
}

fn run_inspect(infile: PathBuf, show_blocks: bool) -> anyhow::Result<()> {
    let mut f = File::open(&infile).with_context(|| format!("opening input file {:?}", infile))?;
    let file_len = f.metadata()?.len();
    let mut header_buf = [0u8; HEADER_SIZE];
    f.read_exact(&mut header_buf)?;
    let header = Header::from_bytes(&header_buf, Some(file_len))?;

    let reader = open_reader(&infile)?;

    println!("=== ZEEX file: {:?} ===", infile);
    println!();
    println!("  version        : {}", header.version);
    println!("  block size     : {}", human_bytes(header.block_size));
    println!("  block count    : {}", reader.block_count());
    println!("  data length    : {}", human_bytes(header.data_length));
    println!("  cdata length   : {}", human_bytes(header.cdata_length));
    println!("  file on disk   : {}", human_bytes(file_len));
    if header.data_length > 0 {
        println!(
            "  ratio          : {:.2}x",
            header.data_length as f64 / header.cdata_length.max(1) as f64
        );
    }

    if show_blocks {
        f.seek(SeekFrom::Start(HEADER_SIZE as u64 + header.cdata_length))?;
        let mut size_buf = [0u8; 4];
        f.read_exact(&mut size_buf)?;
        let index_size = u32::from_le_bytes(size_buf);
        let mut entries_buf = vec![0u8; index_size as usize * 8];
        f.read_exact(&mut entries_buf)?;
        let entries = zeex_core::index::decode_entries(&entries_buf, index_size);

        println!();
        println!("  {:>8}  {:>16}  {:>16}", "block", "cstart", "cend");
        for (i, &start) in entries.iter().enumerate() {
            let end = entries.get(i + 1).copied().unwrap_or(header.cdata_length);
            println!("  {:>8}  {:>16}  {:>16}", i, start, end);
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Compress {
            infile,
            outfile,
            block_size,
        } => run_compress(infile, outfile, block_size),
        Commands::Decompress { infile, outfile } => run_decompress(infile, outfile),
        Commands::Extract {
            infile,
            start,
            end,
            outfile,
        } => run_extract(infile, start, end, outfile),
        Commands::Inspect { infile, blocks } => run_inspect(infile, blocks),
    };

    if let Err(err) = result {
        eprintln!("zeex: error: {:#}", err);
        std::process::exit(1);
    }
}
