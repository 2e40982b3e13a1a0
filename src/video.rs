use std::io::{self, ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError};
use std::thread;

use anyhow::{Context, Result, bail};
use log::debug;

/// What a call to [`VideoPlayer::update`] produced.
#[derive(Debug, PartialEq, Eq)]
pub enum FrameStatus {
    Waiting,  // No new frame due yet
    NewFrame, // `frame()` holds fresh pixels
    Ended,    // Stream ended after at least one frame
    Empty,    // Stream ended before the first frame
}

/// Builds the ffmpeg invocation decoding `path` to raw RGBA frames on stdout.
///
/// Frames are letterboxed to `width` x `height` at a fixed rate so the reader
/// always knows the frame size and timing.
pub fn decode_command(ffmpeg: &Path, path: &Path, width: i32, height: i32, fps: u32) -> Command {
    let filter = format!(
        "fps={fps},scale={width}:{height}:force_original_aspect_ratio=decrease,pad={width}:{height}:(ow-iw)/2:(oh-ih)/2"
    );
    let mut command = Command::new(ffmpeg);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .args(["-loglevel", "error"])
        .arg("-nostdin")
        .arg("-i")
        .arg(path)
        .arg("-an")
        .args(["-vf", &filter])
        .args(["-f", "rawvideo"])
        .args(["-pix_fmt", "rgba"])
        .arg("-");
    command
}

/// What the reader thread hands over to the player.
enum Chunk {
    Frame(Vec<u8>),
    End,
    Failed(io::Error),
}

/// Frames decoded ahead of the video clock.
const FRAMES_BUFFERED: usize = 2;

/// Reads whole frames off the pipe until it closes or the player goes away.
fn read_frames(mut stdout: ChildStdout, frame_len: usize, frames: SyncSender<Chunk>) {
    loop {
        let mut frame = vec![0; frame_len];
        let chunk = match stdout.read_exact(&mut frame) {
            Ok(()) => Chunk::Frame(frame),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Chunk::End,
            Err(e) => Chunk::Failed(e),
        };
        let last = !matches!(chunk, Chunk::Frame(_));
        if frames.send(chunk).is_err() || last {
            return;
        }
    }
}

/// Plays one video file through an ffmpeg child process.
///
/// The pipe is drained on a separate thread, so a slow decoder never blocks
/// the frame loop.
pub struct VideoPlayer {
    process: Child,
    frames: Receiver<Chunk>,
    frame: Vec<u8>,
    fps: u32,
    clock: f32,
    frames_read: u64,
    ended: bool,
}

impl VideoPlayer {
    pub fn spawn(ffmpeg: &Path, path: &Path, width: i32, height: i32, fps: u32) -> Result<VideoPlayer> {
        if !path.is_file() {
            bail!("{} does not exist", path.display());
        }
        let command = decode_command(ffmpeg, path, width, height, fps);
        // 4 bytes per pixel (RGBA)
        VideoPlayer::start(command, (width * height * 4) as usize, fps)
            .with_context(|| format!("failed to start {}", ffmpeg.display()))
    }

    /// Runs `command` and treats every `frame_len` bytes of its stdout as a frame.
    fn start(mut command: Command, frame_len: usize, fps: u32) -> Result<VideoPlayer> {
        let mut process = command.stdout(Stdio::piped()).spawn()?;
        let stdout = process.stdout.take().context("failed to open ffmpeg stdout")?;
        let (sender, frames) = mpsc::sync_channel(FRAMES_BUFFERED);
        if let Err(e) = thread::Builder::new()
            .name("video-reader".to_string())
            .spawn(move || read_frames(stdout, frame_len, sender))
        {
            let _ = process.kill();
            let _ = process.wait();
            return Err(e).context("failed to start the frame reader");
        }
        Ok(VideoPlayer {
            process,
            frames,
            frame: vec![0; frame_len],
            fps: fps.max(1),
            clock: 0.0,
            frames_read: 0,
            ended: false,
        })
    }

    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    /// Advances the video clock by `dt` seconds and takes every frame now due.
    pub fn update(&mut self, dt: f32) -> Result<FrameStatus> {
        if self.ended {
            return Ok(FrameStatus::Waiting);
        }
        self.clock += dt;
        // First frame is due immediately
        let due = (self.clock * self.fps as f32) as u64 + 1;

        let mut status = FrameStatus::Waiting;
        while self.frames_read < due {
            match self.frames.try_recv() {
                Ok(Chunk::Frame(frame)) => {
                    self.frame = frame;
                    self.frames_read += 1;
                    status = FrameStatus::NewFrame;
                }
                Ok(Chunk::End) | Err(TryRecvError::Disconnected) => {
                    debug!("Video ended after {} frames", self.frames_read);
                    self.ended = true;
                    return Ok(if self.frames_read == 0 {
                        FrameStatus::Empty
                    } else {
                        FrameStatus::Ended
                    });
                }
                Ok(Chunk::Failed(e)) => {
                    self.ended = true;
                    return Err(e).context("failed to read from ffmpeg");
                }
                Err(TryRecvError::Empty) => {
                    // Decoder is behind: hold the clock at the next frame
                    self.clock = self.clock.min(self.frames_read as f32 / self.fps as f32);
                    break;
                }
            }
        }
        Ok(status)
    }
}

impl Drop for VideoPlayer {
    fn drop(&mut self) {
        // The reader sees the pipe close, or a dropped receiver, and exits on its own.
        if let Err(e) = self.process.kill() {
            debug!("ffmpeg already exited: {}", e);
        }
        if let Err(e) = self.process.wait() {
            debug!("Failed to wait for ffmpeg: {}", e);
        }
    }
}
