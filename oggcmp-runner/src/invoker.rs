use crate::outcome::NO_EXIT_CODE;
use camino::Utf8Path;
use std::io;
use std::process::Command;

/// Runs one decoder executable to completion and reports its exit code.
pub trait Invoker {
    fn invoke(&self, executable: &Utf8Path, args: &[String]) -> io::Result<i32>;
}

impl<I: Invoker + ?Sized> Invoker for &I {
    fn invoke(&self, executable: &Utf8Path, args: &[String]) -> io::Result<i32> {
        (**self).invoke(executable, args)
    }
}

/// Spawns the executable as a child process and blocks until it exits.
///
/// The child's stdout and stderr are captured and forwarded to the log so
/// that decoder chatter does not interleave with the case transcript. No
/// timeout is applied: a decoder that hangs blocks the run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessInvoker;

impl Invoker for ProcessInvoker {
    fn invoke(&self, executable: &Utf8Path, args: &[String]) -> io::Result<i32> {
        tracing::debug!("exec {} {}", executable, args.join(" "));

        let output = Command::new(executable.as_std_path()).args(args).output()?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            tracing::debug!(target: "oggcmp::decoder", "{}", line);
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            tracing::debug!(target: "oggcmp::decoder", "stderr: {}", line);
        }

        match output.status.code() {
            Some(code) => Ok(code),
            None => {
                tracing::warn!("{} terminated without an exit code", executable);
                Ok(NO_EXIT_CODE)
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_is_reported() {
        let code = ProcessInvoker
            .invoke(
                Utf8Path::new("/bin/sh"),
                &["-c".to_owned(), "exit 30".to_owned()],
            )
            .unwrap();
        assert_eq!(code, 30);
    }

    #[test]
    fn test_success_is_zero() {
        let code = ProcessInvoker
            .invoke(Utf8Path::new("/bin/sh"), &["-c".to_owned(), "true".to_owned()])
            .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_signal_maps_to_no_exit_code() {
        let code = ProcessInvoker
            .invoke(
                Utf8Path::new("/bin/sh"),
                &["-c".to_owned(), "kill -9 $$".to_owned()],
            )
            .unwrap();
        assert_eq!(code, NO_EXIT_CODE);
    }

    #[test]
    fn test_missing_executable_is_error() {
        let err = ProcessInvoker
            .invoke(Utf8Path::new("/nonexistent/oggcmp/decoder"), &[])
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
