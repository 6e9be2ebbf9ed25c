mod collections;
mod pointer;
mod string;
mod vec;
