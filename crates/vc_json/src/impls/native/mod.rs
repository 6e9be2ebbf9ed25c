mod native_array;
mod native_num;
mod native_tuple;
