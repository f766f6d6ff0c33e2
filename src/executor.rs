// Bounded worker pool for per-file extraction jobs.
//
// Each worker runs one job at a time and pulls the next one off a shared
// queue, so at most `ceiling` external processes exist at any instant. The
// calling thread owns the result list and sees completions one by one.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Mutex};

/// Run `jobs` on at most `ceiling` threads (0 is treated as 1).
///
/// Returns every result in completion order, or the first error to arrive.
/// Once a job fails no further jobs are started; jobs already running finish
/// on their own and their results are dropped. `on_complete` is called on the
/// calling thread for each successful result.
pub fn run_bounded<J, T, E, F, C>(
    jobs: Vec<J>,
    ceiling: usize,
    work: F,
    mut on_complete: C,
) -> Result<Vec<T>, E>
where
    J: Send,
    T: Send,
    E: Send,
    F: Fn(J) -> Result<T, E> + Sync,
    C: FnMut(&T),
{
    let total = jobs.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let workers = ceiling.clamp(1, total);
    let queue = Mutex::new(VecDeque::from(jobs));
    let stopped = AtomicBool::new(false);
    let (tx, rx) = mpsc::channel::<Result<T, E>>();

    std::thread::scope(|s| {
        for _ in 0..workers {
            let tx = tx.clone();
            let queue = &queue;
            let stopped = &stopped;
            let work = &work;
            s.spawn(move || {
                while !stopped.load(Ordering::SeqCst) {
                    let Some(job) = queue.lock().ok().and_then(|mut q| q.pop_front()) else {
                        break;
                    };
                    let outcome = work(job);
                    if outcome.is_err() {
                        stopped.store(true, Ordering::SeqCst);
                    }
                    if tx.send(outcome).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut results = Vec::with_capacity(total);
        for outcome in rx {
            match outcome {
                Ok(value) => {
                    on_complete(&value);
                    results.push(value);
                }
                Err(err) => {
                    stopped.store(true, Ordering::SeqCst);
                    return Err(err);
                }
            }
        }
        Ok(results)
    })
}
