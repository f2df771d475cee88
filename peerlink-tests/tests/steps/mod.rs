mod codec_steps;
mod loopback_steps;
mod session_steps;
mod teardown_steps;
