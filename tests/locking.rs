use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use heapdb::lock::{try_acquire_lock, LockMode};
use heapdb::{HeapConfig, HeapError, HeapFile};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base = std::env::temp_dir();
    base.join(format!("heapdbtest-lock-{prefix}-{pid}-{t}-{id}"))
}

#[test]
fn concurrent_inserts_do_not_lose_records() -> Result<()> {
    let root = unique_root("concurrent");
    fs::create_dir_all(&root)?;
    let path = root.join("shared.heap");
    HeapFile::create(&path, HeapConfig::default())?;

    const THREADS: usize = 4;
    const PER_THREAD: usize = 60;

    let mut handles = Vec::new();
    for t in 0..THREADS {
        let path = path.clone();
        handles.push(thread::spawn(move || -> Result<()> {
            let hf = HeapFile::new(&path);
            for i in 0..PER_THREAD {
                let rec = format!("t{}-r{:03}-{}", t, i, "x".repeat(90));
                hf.insert_record(rec.as_bytes())?;
            }
            Ok(())
        }));
    }
    for h in handles {
        h.join().map_err(|_| anyhow::anyhow!("insert thread panicked"))??;
    }

    let hf = HeapFile::new(&path);
    let all = hf.scan_all_records()?;
    assert_eq!(all.len(), THREADS * PER_THREAD);
    let unique: BTreeSet<Vec<u8>> = all.into_iter().collect();
    assert_eq!(unique.len(), THREADS * PER_THREAD);
    assert!(hf.check()?.is_clean());

    fs::remove_dir_all(&root)?;
    Ok(())
}

#[test]
fn exclusive_lock_blocks_second_try_lock() -> Result<()> {
    let root = unique_root("try-lock");
    fs::create_dir_all(&root)?;
    let path = root.join("locked.heap");
    HeapFile::create(&path, HeapConfig::default())?;

    let f1 = OpenOptions::new().read(true).write(true).open(&path)?;
    let g1 = try_acquire_lock(f1, &path, LockMode::Exclusive)?;
    assert_eq!(g1.mode(), Some(LockMode::Exclusive));

    let f2 = OpenOptions::new().read(true).open(&path)?;
    match try_acquire_lock(f2, &path, LockMode::Shared) {
        Err(HeapError::Lock { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected Lock error, got {:?}", other.map(|g| g.mode())),
    }

    drop(g1);
    let f3 = OpenOptions::new().read(true).open(&path)?;
    let g3 = try_acquire_lock(f3, &path, LockMode::Shared)?;
    assert_eq!(g3.path(), path.as_path());
    drop(g3);

    fs::remove_dir_all(&root)?;
    Ok(())
}

#[test]
fn lock_can_be_disabled() -> Result<()> {
    let root = unique_root("no-lock");
    fs::create_dir_all(&root)?;
    let path = root.join("plain.heap");

    let cfg = HeapConfig::default().with_file_lock(false).with_data_fsync(true);
    let hf = HeapFile::create(&path, cfg.clone())?;
    assert_eq!(hf.config(), &cfg);

    // чужая exclusive-блокировка не мешает, когда HeapFile блокировки не берёт
    let f = OpenOptions::new().read(true).write(true).open(&path)?;
    let _g = try_acquire_lock(f, &path, LockMode::Exclusive)?;
    let rid = hf.insert_record(b"unlocked")?;
    assert_eq!(hf.read_record(rid.page, rid.slot)?, b"unlocked".to_vec());

    fs::remove_dir_all(&root)?;
    Ok(())
}
