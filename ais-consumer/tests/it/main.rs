mod consumer;
mod helper;
mod stream;
mod subscription;
