mod duration;
mod num;
mod option;
