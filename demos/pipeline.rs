// demos/pipeline.rs
//
// Runs all four structures in one process:
//   producers --MPMC--> scheduler (PriorityQueue) --SPSC--> receiver
//                                 \--ring buffer (frames)--/
// The receiver checks every frame's SHA-256 against the job it belongs to.
//
// cargo run --example pipeline -- 20000
// cargo run --example pipeline --features tracing -- 20000

use conduit::MPMC::MpmcQueue;
use conduit::PrioQ::PriorityQueue;
use conduit::Ring::{ring_buffer, RingReader, RingWriter};
use conduit::SPSC::{Consumer, OverflowPolicy, Producer, SpscBuilder};
use sha2::{Digest, Sha256};
use std::env;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const PRODUCERS: usize = 3;
const REORDER_WINDOW: usize = 64;
const FRAME_HEADER: usize = 2;

struct Job {
    id: usize,
    priority: u8,
    body: String,
    digest: [u8; 32],
}

fn sha256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

fn produce(producer: usize, jobs: usize, queue: &MpmcQueue<Job>, keep_running: &AtomicBool) -> usize {
    let mut sent = 0;
    for id in (producer..jobs).step_by(PRODUCERS) {
        if !keep_running.load(Ordering::SeqCst) {
            break;
        }
        let body = format!("message_{id}");
        let mut job = Job {
            id,
            priority: (id % 7) as u8,
            digest: sha256(body.as_bytes()),
            body,
        };
        loop {
            match queue.push(job) {
                Ok(()) => break,
                Err(back) => {
                    job = back;
                    thread::sleep(Duration::from_micros(10));
                }
            }
        }
        sent += 1;
    }
    sent
}

/// Length-prefixed frame, written in one piece so the reader never sees half of it.
fn send_frame(writer: &mut RingWriter, body: &[u8]) {
    let mut frame = Vec::with_capacity(FRAME_HEADER + body.len());
    frame.extend_from_slice(&(body.len() as u16).to_le_bytes());
    frame.extend_from_slice(body);
    while writer.write_atomic(&frame) == 0 {
        thread::yield_now();
    }
}

fn recv_frame(reader: &mut RingReader) -> Vec<u8> {
    let mut header = [0u8; FRAME_HEADER];
    while reader.read_atomic(&mut header) == 0 {
        thread::yield_now();
    }
    let mut body = vec![0u8; u16::from_le_bytes(header) as usize];
    while reader.read_atomic(&mut body) == 0 {
        thread::yield_now();
    }
    body
}

fn schedule(
    queue: &MpmcQueue<Job>,
    producers_left: &AtomicUsize,
    mut tx: Producer<Job>,
    mut writer: RingWriter,
    finished: &AtomicBool,
) -> usize {
    let mut pending = PriorityQueue::new(|a: &Job, b: &Job| a.priority.cmp(&b.priority));
    pending.preallocate(REORDER_WINDOW);
    let mut forwarded = 0;

    loop {
        let draining = producers_left.load(Ordering::SeqCst) == 0;
        while pending.len() < REORDER_WINDOW {
            match queue.pop() {
                Some(job) => pending.push(job),
                None => break,
            }
        }

        if pending.len() < REORDER_WINDOW && !draining {
            thread::yield_now();
            continue;
        }

        let Some(job) = pending.pop() else {
            // Producers are done and the queue was empty when we looked.
            if queue.is_empty() {
                break;
            }
            continue;
        };
        send_frame(&mut writer, job.body.as_bytes());
        tx.push(job);
        forwarded += 1;
    }

    println!(
        "Scheduler: forwarded {forwarded} jobs, {} SPSC overflows waited out",
        tx.overflows()
    );
    finished.store(true, Ordering::Release);
    forwarded
}

fn receive(mut rx: Consumer<Job>, mut reader: RingReader, finished: &AtomicBool) -> (usize, usize) {
    let mut verified = 0;
    let mut mismatched = 0;
    loop {
        let done = finished.load(Ordering::Acquire);
        let Some(job) = rx.pop() else {
            if done {
                break;
            }
            thread::yield_now();
            continue;
        };

        let frame = recv_frame(&mut reader);
        if frame == job.body.as_bytes() && sha256(&frame) == job.digest {
            verified += 1;
        } else {
            mismatched += 1;
            eprintln!("Receiver: digest mismatch for job {}", job.id);
        }
    }
    (verified, mismatched)
}

fn main() {
    conduit::trace::init_tracing();

    let args: Vec<String> = env::args().collect();
    let jobs: usize = match args.get(1).map(|s| s.parse()) {
        None => 10_000,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("Usage: {} [num_jobs]: {e}", args[0]);
            std::process::exit(1);
        }
    };

    let keep_running = Arc::new(AtomicBool::new(true));
    let keep_running_for_handler = Arc::clone(&keep_running);
    if let Err(e) = ctrlc::set_handler(move || {
        keep_running_for_handler.store(false, Ordering::SeqCst);
    }) {
        eprintln!("Error setting Ctrl+C handler: {e}");
    }

    let queue = MpmcQueue::new(256);
    let producers_left = AtomicUsize::new(PRODUCERS);
    let finished = AtomicBool::new(false);

    let (tx, rx) = SpscBuilder::new()
        .with_capacity(128)
        .with_overflow_policy(OverflowPolicy::Block)
        .with_poll_interval(Duration::from_micros(50))
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Failed to build SPSC queue: {e}");
            std::process::exit(1);
        });
    let (writer, reader) = ring_buffer(4096);

    println!("Pipeline: {jobs} jobs, {PRODUCERS} producers");
    let start = Instant::now();

    let (sent, forwarded, (verified, mismatched)) = thread::scope(|s| {
        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let (queue, keep_running, producers_left) = (&queue, &*keep_running, &producers_left);
                s.spawn(move || {
                    let sent = produce(p, jobs, queue, keep_running);
                    producers_left.fetch_sub(1, Ordering::SeqCst);
                    sent
                })
            })
            .collect();

        let scheduler = s.spawn(|| schedule(&queue, &producers_left, tx, writer, &finished));
        let receiver = s.spawn(|| receive(rx, reader, &finished));

        let sent: usize = producers.into_iter().map(|h| h.join().unwrap_or(0)).sum();
        let forwarded = scheduler.join().unwrap_or(0);
        let checked = receiver.join().unwrap_or((0, 0));
        (sent, forwarded, checked)
    });

    println!(
        "Pipeline: sent {sent}, forwarded {forwarded}, verified {verified}, mismatched {mismatched} in {:.2?}",
        start.elapsed()
    );
    conduit::Core::print_alloc_info();

    if mismatched > 0 || verified != sent {
        std::process::exit(1);
    }
}
